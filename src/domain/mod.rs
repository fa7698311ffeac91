// Domain layer: records and ports. Nothing here talks to the network or disk.

pub mod model;
pub mod ports;

pub use model::{City, Point, Region};
pub use ports::{CacheBackend, RemoteLookup};
