// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use encoding::repr::*;
use num_derive::FromPrimitive;
use std::fmt;

/// ExitCode defines the exit code from the VM execution.
#[repr(u32)]
#[derive(PartialEq, Eq, Debug, Clone, Copy, FromPrimitive, Serialize_repr, Deserialize_repr)]
pub enum ExitCode {
    Ok = 0,

    /// Indicates failure to find an actor in the state tree.
    /// Code 1 is also the generic trap value for unclassified failures.
    SysErrSenderInvalid = 1,

    /// Indicates that the message sender was in an invalid state to send this message.
    SysErrSenderStateInvalid = 2,

    /// Indicates failure to find a method in an actor.
    SysErrInvalidMethod = 3,

    /// Unused.
    SysErrReserved1 = 4,

    /// Indicates that the receiver of a message is not valid (and cannot be implicitly created).
    SysErrInvalidReceiver = 5,

    /// Indicates a message sender has insufficient funds for a message's execution.
    SysErrInsufficientFunds = 6,

    /// Indicates message execution (including subcalls) used more gas than the specified limit.
    SysErrOutOfGas = 7,

    /// Indicates a message execution is forbidden for the caller.
    SysErrForbidden = 8,

    /// Indicates actor code performed a disallowed operation. Disallowed operations include:
    /// - mutating state outside of a state acquisition block
    /// - failing to invoke caller validation
    /// - aborting with a reserved exit code (including success or a system error).
    SysErrorIllegalActor = 9,

    /// Indicates an invalid argument passed to a runtime method.
    SysErrorIllegalArgument = 10,

    /// Reserved exit codes, do not use.
    SysErrReserved2 = 11,
    SysErrReserved3 = 12,
    SysErrReserved4 = 13,
    SysErrReserved5 = 14,
    SysErrReserved6 = 15,

    // -------Actor Error Codes-------
    /// Indicates a method parameter is invalid.
    ErrIllegalArgument = 16,
    /// Indicates a requested resource does not exist.
    ErrNotFound = 17,
    /// Indicates an action is disallowed.
    ErrForbidden = 18,
    /// Indicates a balance of funds is insufficient.
    ErrInsufficientFunds = 19,
    /// Indicates an actor's internal state is invalid.
    ErrIllegalState = 20,
    /// Indicates de/serialization failure within actor code.
    ErrSerialization = 21,

    ErrPlaceholder = 1000,
}

impl ExitCode {
    /// Returns true if the exit code was a success.
    pub fn is_success(self) -> bool {
        self == ExitCode::Ok
    }

    /// Returns true if exited with an error code.
    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    /// Returns true if the error code is in the reserved system error range.
    pub fn is_system_error(self) -> bool {
        (self as u32) < (ExitCode::ErrIllegalArgument as u32)
    }

    /// Returns true if the execution may persist its state changes.
    pub fn allows_state_update(self) -> bool {
        self.is_success()
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_classification() {
        assert!(ExitCode::Ok.is_success());
        assert!(ExitCode::SysErrOutOfGas.is_system_error());
        assert!(ExitCode::SysErrOutOfGas.is_error());
        assert!(!ExitCode::ErrIllegalState.is_system_error());
        assert!(!ExitCode::Ok.is_error());
    }
}
