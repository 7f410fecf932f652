#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PackError {
    #[error("pack() called before centerize(); no center point is set")]
    UninitializedCenter,
    #[error("pack() called on a collection with zero total weight")]
    ZeroTotalWeight,
    #[error("particle weight must be a positive finite number, got {weight}")]
    NonPositiveWeight { weight: f32 },
}

pub type Result<T> = std::result::Result<T, PackError>;
