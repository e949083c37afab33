pub mod gravity_loads;
pub mod material_table;
pub mod naming;
pub mod prestress;
pub mod serialization;
pub mod thermal_profile;

mod dispatch;
mod helpers;
mod traits;

pub use dispatch::{executor_for, execute_tool};
pub use traits::ModuleExecutor;
