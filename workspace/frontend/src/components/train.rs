mod view;

pub use view::Train;
