pub mod frame_like;

pub use frame_like::{
    FrameLike,
    MobilityScanLike,
};
