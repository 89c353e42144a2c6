// Domain layer: blend model and ports. Nothing here touches files or the terminal.

pub mod model;
pub mod ports;
