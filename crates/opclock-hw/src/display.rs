//! Display output.

use crate::{Frame, HwError};
use log::info;
use std::io::{self, Write};

/// A physical (or simulated) screen the backbuffer is presented on.
pub trait Display: Send {
    fn init(&mut self) -> Result<(), HwError>;

    /// Push one frame to the screen. Only valid between `init` and `deinit`.
    fn present(&mut self, frame: &Frame) -> Result<(), HwError>;

    fn deinit(&mut self) -> Result<(), HwError>;
}

/// Text display writing one line per presented frame.
/// Used when running without a panel attached.
pub struct ConsoleDisplay {
    out: Box<dyn Write + Send>,
    initialized: bool,
}

impl ConsoleDisplay {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            initialized: false,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl Display for ConsoleDisplay {
    fn init(&mut self) -> Result<(), HwError> {
        writeln!(self.out, "[display] on")?;
        self.out.flush()?;
        self.initialized = true;
        info!("Console display initialized");
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<(), HwError> {
        if !self.initialized {
            return Err(HwError::NotInitialized);
        }
        writeln!(self.out, "{}", frame.to_line())?;
        self.out.flush()?;
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), HwError> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;
        writeln!(self.out, "[display] off")?;
        self.out.flush()?;
        info!("Console display released");
        Ok(())
    }
}
