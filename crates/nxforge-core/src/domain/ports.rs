//! Local development port allocation.

use std::collections::BTreeSet;

use crate::domain::error::DomainError;

/// Lowest port `>= base` that is not in `used`.
///
/// # Errors
///
/// [`DomainError::PortsExhausted`] when every port from `base` to 65535 is
/// taken.
pub fn next_free_port<I>(used: I, base: u16) -> Result<u16, DomainError>
where
    I: IntoIterator<Item = u16>,
{
    let used: BTreeSet<u16> = used.into_iter().collect();
    (base..=u16::MAX)
        .find(|candidate| !used.contains(candidate))
        .ok_or(DomainError::PortsExhausted { base })
}
