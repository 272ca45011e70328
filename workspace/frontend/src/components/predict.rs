mod form;
mod location_map;
mod model_info;
mod result;
mod view;

pub use view::Predict;
