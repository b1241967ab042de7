use chrono::Utc;

/// Issues record ids as millisecond timestamps, strictly increasing within a
/// session and always above any numeric id that was loaded from storage.
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub(crate) fn seeded<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let last = existing
            .into_iter()
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub(crate) fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        self.last.to_string()
    }
}
