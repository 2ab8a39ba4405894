// Domain layer: the company record, its normalization, and the ports the store depends on.

pub mod model;
pub mod normalize;
pub mod ports;
