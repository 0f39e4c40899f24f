pub mod aws;
pub mod form;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod store;
pub mod sync;
