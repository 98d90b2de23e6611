pub mod domain;
pub mod ports;
pub mod status;
pub mod validate;
pub mod viewer;

pub use domain::{
    AssetKind, AssetReport, AssetStat, DiagnosticReport, HealthState, SimpleStatus,
};
pub use ports::{AssetSource, AssetStore, Clock, PortError, PortResult, SystemClock};
pub use status::StatusService;
pub use validate::ValidationError;
