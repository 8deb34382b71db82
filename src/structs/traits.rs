use super::Result;

pub trait Verify {
    /// Verifying that this struct is sane
    ///
    /// NB: This is called on the raw app definition, before any ports are completed.
    fn verify(&self) -> Result<()>;
}
