//! Recording interface shared by the unit tests

use alloc::vec::Vec;

use crate::interface::DisplayInterface;

/// One transfer seen by [`MockInterface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Command(u8),
    Data(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Records every transfer in order; optionally fails the Nth attempt
#[derive(Debug, Default)]
pub struct MockInterface {
    pub log: Vec<Transfer>,
    /// Zero-based index of the transfer attempt that fails
    pub fail_at: Option<usize>,
    attempts: usize,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<u8> {
        self.log
            .iter()
            .filter_map(|t| match t {
                Transfer::Command(c) => Some(*c),
                Transfer::Data(_) => None,
            })
            .collect()
    }

    pub fn data(&self) -> Vec<Vec<u8>> {
        self.log
            .iter()
            .filter_map(|t| match t {
                Transfer::Data(d) => Some(d.clone()),
                Transfer::Command(_) => None,
            })
            .collect()
    }

    fn attempt(&mut self, transfer: Transfer) -> Result<(), MockError> {
        let index = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(index) {
            return Err(MockError);
        }
        self.log.push(transfer);
        Ok(())
    }
}

impl DisplayInterface for MockInterface {
    type Error = MockError;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.attempt(Transfer::Command(command))
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.attempt(Transfer::Data(data.to_vec()))
    }
}
