pub mod period;
pub mod record;
pub mod remote;
pub mod roster;
pub mod sync_status;
