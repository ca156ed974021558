pub mod foundation;

pub use foundation::ChainFoundation;
