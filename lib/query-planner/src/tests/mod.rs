mod complex_keys;
mod entities;
mod key_preference;
mod testkit;
mod walker_invariants;
