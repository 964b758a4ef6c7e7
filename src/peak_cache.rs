use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::pipeline::PlayerPeakData;

/// Caller-owned memo of computed results, keyed by player id.
///
/// Bounded: inserting past `capacity` evicts the least recently used player.
/// Nothing is invalidated implicitly; callers drop entries with
/// [`PeakCache::invalidate`] or [`PeakCache::clear`].
#[derive(Debug)]
pub struct PeakCache {
    capacity: usize,
    entries: HashMap<String, Arc<PlayerPeakData>>,
    recency: VecDeque<String>,
}

impl PeakCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.contains_key(player_id)
    }

    pub fn get(&mut self, player_id: &str) -> Option<Arc<PlayerPeakData>> {
        let hit = self.entries.get(player_id).cloned()?;
        self.touch(player_id);
        Some(hit)
    }

    pub fn insert(&mut self, data: PlayerPeakData) -> Arc<PlayerPeakData> {
        let id = data.player_id.clone();
        let data = Arc::new(data);
        if self.entries.insert(id.clone(), data.clone()).is_some() {
            self.touch(&id);
            return data;
        }
        self.recency.push_back(id);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            log::debug!("evicting cached peak data for {oldest}");
            self.entries.remove(&oldest);
        }
        data
    }

    pub fn get_or_try_insert_with<E>(
        &mut self,
        player_id: &str,
        compute: impl FnOnce() -> Result<PlayerPeakData, E>,
    ) -> Result<Arc<PlayerPeakData>, E> {
        if let Some(hit) = self.get(player_id) {
            return Ok(hit);
        }
        let data = compute()?;
        Ok(self.insert(data))
    }

    pub fn invalidate(&mut self, player_id: &str) -> bool {
        let removed = self.entries.remove(player_id).is_some();
        if removed {
            self.recency.retain(|id| id != player_id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn touch(&mut self, player_id: &str) {
        if let Some(pos) = self.recency.iter().position(|id| id == player_id) {
            if let Some(id) = self.recency.remove(pos) {
                self.recency.push_back(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PlayerTables, run};
    use crate::season_table::RawRow;

    fn raw(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn data(id: &str) -> PlayerPeakData {
        let row = raw(&[
            ("Season", "2000-01"),
            ("Tm", "SAC"),
            ("G", "70"),
            ("PER", "20.0"),
            ("WS", "9.0"),
        ]);
        run(&PlayerTables {
            player_id: id.to_string(),
            per_game: vec![row.clone()],
            advanced: vec![row],
            playoff_per_game: None,
            playoff_advanced: None,
        })
        .unwrap()
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = PeakCache::new(2);
        cache.insert(data("a01"));
        cache.insert(data("b01"));
        assert!(cache.get("a01").is_some());
        cache.insert(data("c01"));
        assert!(cache.contains("a01"));
        assert!(!cache.contains("b01"));
        assert!(cache.contains("c01"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn compute_runs_once_per_player() {
        let mut cache = PeakCache::new(4);
        let mut calls = 0;
        for _ in 0..3 {
            let out: Result<_, ()> = cache.get_or_try_insert_with("a01", || {
                calls += 1;
                Ok(data("a01"))
            });
            assert!(out.is_ok());
        }
        assert_eq!(calls, 1);
        assert!(cache.invalidate("a01"));
        assert!(!cache.invalidate("a01"));
        assert!(cache.is_empty());
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = PeakCache::new(1);
        let out = cache.get_or_try_insert_with("x01", || Err::<PlayerPeakData, _>("boom"));
        assert_eq!(out.unwrap_err(), "boom");
        assert!(cache.is_empty());
    }
}
