//! Fixed-length code entry buffer with edge-triggered completion

/// How a complete code gets submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Verify as soon as the buffer becomes full
    Auto,
    /// Wait for an explicit submit action
    Manual,
}

impl SubmitMode {
    pub fn from_auto_submit(auto_submit: bool) -> Self {
        if auto_submit {
            SubmitMode::Auto
        } else {
            SubmitMode::Manual
        }
    }
}

/// Result of an edit to the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Buffer unchanged (full, not a digit, or nothing to remove)
    Unchanged,
    /// Buffer changed but completion was not newly reached
    Edited,
    /// Buffer just became complete; carries the full code
    Completed(String),
}

/// Holds the digits typed so far, capped at the configured length
#[derive(Debug, Clone)]
pub struct CodeEntryController {
    buffer: String,
    code_length: usize,
    mode: SubmitMode,
    was_complete: bool,
}

impl CodeEntryController {
    pub fn new(code_length: usize, mode: SubmitMode) -> Self {
        Self {
            buffer: String::with_capacity(code_length),
            code_length,
            mode,
            was_complete: false,
        }
    }

    /// Append one digit; a no-op once full or for non-digits
    pub fn append(&mut self, c: char) -> EntryOutcome {
        if !c.is_ascii_digit() || self.buffer.len() >= self.code_length {
            return EntryOutcome::Unchanged;
        }
        self.buffer.push(c);
        self.settle()
    }

    /// Remove the last digit
    pub fn remove_last(&mut self) -> EntryOutcome {
        if self.buffer.pop().is_none() {
            return EntryOutcome::Unchanged;
        }
        self.settle()
    }

    /// Replace the buffer with the digits of a pasted text, truncated to length
    pub fn fill(&mut self, text: &str) -> EntryOutcome {
        let digits: String = text
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.code_length)
            .collect();
        if digits.is_empty() || digits == self.buffer {
            return EntryOutcome::Unchanged;
        }
        self.buffer = digits;
        self.settle()
    }

    /// Clear the buffer and re-arm the completion trigger
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.was_complete = false;
    }

    pub fn is_complete(&self) -> bool {
        self.buffer.len() == self.code_length
    }

    /// Manual submit is enabled only for a complete code
    pub fn can_submit(&self) -> bool {
        self.is_complete()
    }

    pub fn code(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn mode(&self) -> SubmitMode {
        self.mode
    }

    /// Compare previous and current completion; report only the rising edge
    fn settle(&mut self) -> EntryOutcome {
        let complete = self.is_complete();
        let rising = complete && !self.was_complete;
        self.was_complete = complete;
        if rising {
            EntryOutcome::Completed(self.buffer.clone())
        } else {
            EntryOutcome::Edited
        }
    }
}
