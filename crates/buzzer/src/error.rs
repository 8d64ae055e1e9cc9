//! Driver errors

/// Sounder errors
///
/// `E` is the PWM peripheral's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The PWM peripheral rejected an operation
    Pwm(E),
    /// The board-identification pin could not be read
    BoardId,
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for Error<E> {}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pwm(e) => write!(f, "PWM peripheral error: {e:?}"),
            Self::BoardId => write!(f, "Board identification pin read failed"),
        }
    }
}
