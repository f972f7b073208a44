pub mod time;

pub use time::*;

pub trait Identifiable {
    fn id(&self) -> &str;
}
