//! Loader commands
pub mod command_trait;
pub mod depmod;
pub mod insmod;
pub mod load;
pub mod lsmod;
pub mod modinfo;
pub mod rmmod;

pub use depmod::DepmodCommand;
pub use insmod::InsmodCommand;
pub use load::LoadCommand;
pub use lsmod::LsmodCommand;
pub use modinfo::ModinfoCommand;
pub use rmmod::RmmodCommand;
