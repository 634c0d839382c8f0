//! Percentage-complete tracking for submissions

/// Records written so far out of the records to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Rounded down, so 100 only once every record is written
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed.min(self.total) * 100) / self.total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }

    pub(crate) fn advance(&mut self, records: usize) {
        self.completed = (self.completed + records).min(self.total);
    }
}

/// Text progress bar, e.g. `[##########..........]  50% (3/6)`
pub fn render_bar(progress: Progress, width: usize) -> String {
    let filled = (progress.percent() as usize * width) / 100;
    format!(
        "[{}{}] {:>3}% ({}/{})",
        "#".repeat(filled),
        ".".repeat(width - filled),
        progress.percent(),
        progress.completed,
        progress.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_down() {
        let mut progress = Progress::new(3);
        assert_eq!(progress.percent(), 0);
        progress.advance(2);
        assert_eq!(progress.percent(), 66);
        progress.advance(1);
        assert_eq!(progress.percent(), 100);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_never_hits_100_early() {
        let mut progress = Progress::new(1000);
        progress.advance(999);
        assert_eq!(progress.percent(), 99);
    }

    #[test]
    fn test_render_bar() {
        let progress = Progress {
            completed: 3,
            total: 6,
        };
        assert_eq!(render_bar(progress, 10), "[#####.....]  50% (3/6)");
    }
}
