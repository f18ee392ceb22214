#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use fidreg_linalg as linalg;

#[doc(inline)]
pub use fidreg_registration as registration;

pub use fidreg_registration::{
    align, AlignmentError, Aligner, Alignment, CoordinateSpace, RigidTransform,
};
