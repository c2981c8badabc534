pub mod reconcile;
pub mod textgrid_io;
pub mod tiers;
