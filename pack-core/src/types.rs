/// Identifier for a particle owned by a [`crate::packer::Packer`].
///
/// This is an index into the packer's particle arena, and is only
/// meaningful within the lifetime of a given `Packer` instance.
pub type ParticleId = usize;
