use std::time::{Duration, Instant};

/// Status bar text that disappears after `duration`
#[derive(Debug, Clone)]
pub struct TimedString {
    content: String,
    timestamp: Instant,
    duration: Duration,
}

impl TimedString {
    pub fn new(content: &str, duration: Duration) -> Self {
        Self {
            content: content.to_string(),
            duration,
            timestamp: Instant::now(),
        }
    }

    pub fn set(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.timestamp = Instant::now();
    }

    pub fn length(&self) -> usize {
        self.as_ref().len()
    }
}

impl AsRef<str> for TimedString {
    fn as_ref(&self) -> &str {
        if self.timestamp.elapsed() > self.duration {
            ""
        } else {
            &self.content
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires() {
        let mut s = TimedString::new("saved", Duration::from_secs(60));
        assert_eq!(s.as_ref(), "saved");
        assert_eq!(s.length(), 5);

        let mut gone = TimedString::new("old", Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(gone.as_ref(), "");
        gone.duration = Duration::from_secs(60);
        gone.set("new");
        assert_eq!(gone.as_ref(), "new");

        s.set(String::from("deleted"));
        assert_eq!(s.as_ref(), "deleted");
    }
}
