use std::sync::Mutex;

/// Round-robin cursor over API keys, shared by concurrent requests.
pub struct Rotator {
    keys: Vec<String>,
    next: Mutex<usize>,
}

impl Rotator {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            next: Mutex::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn next(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let mut idx = self.next.lock().ok()?;
        let key = self.keys[*idx % self.keys.len()].clone();
        *idx = (*idx + 1) % self.keys.len();
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::Rotator;

    #[test]
    fn cycles_through_keys_in_order() {
        let rotator = Rotator::new(vec!["a".to_string(), "b".to_string()]);
        let seen: Vec<String> = (0..5).filter_map(|_| rotator.next()).collect();
        assert_eq!(seen, vec!["a", "b", "a", "b", "a"]);
    }

    #[test]
    fn empty_rotator_yields_nothing() {
        let rotator = Rotator::new(Vec::new());
        assert!(rotator.is_empty());
        assert_eq!(rotator.next(), None);
    }
}
