// ── Canonical topology storage ──

mod topology;

pub use topology::TopologyStore;
