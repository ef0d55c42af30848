pub mod distance;
pub mod input;
pub mod location;
pub mod package;
pub mod result;
pub mod truck;

pub use distance::DistanceMatrix;
pub use input::ModelInput;
pub use location::Location;
pub use package::{Package, PackageId, NON_DANGER};
pub use result::ModelResult;
pub use truck::{Truck, TruckId, TruckIdGen, TruckType};
