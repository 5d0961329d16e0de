//! Progress accounting
//!
//! The lesson flow talks to progress through a trait; real persistence lives
//! with whoever implements it. The in-memory implementation backs the CLI
//! and the tests.

/// Record of one completed lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLevel {
    pub lesson_id: u32,
    pub xp: u32,
    pub coins: u32,
    pub stars: u32,
    pub time_seconds: u32,
}

/// Progress collaborator: XP, coins, lives, completed lessons
pub trait Progress {
    /// Add to the running XP and coin totals
    fn add_xp_and_coins(&mut self, xp: u32, coins: u32);

    /// Record a completed lesson
    fn complete_level(&mut self, lesson_id: u32, xp: u32, coins: u32, stars: u32, time_seconds: u32);

    /// Current XP total
    fn xp(&self) -> u32;

    /// Current coin total
    fn coins(&self) -> u32;

    /// Remaining lives
    fn lives(&self) -> u32;
}

/// In-memory progress store
#[derive(Debug, Clone)]
pub struct MemoryProgress {
    xp: u32,
    coins: u32,
    lives: u32,
    completed: Vec<CompletedLevel>,
}

/// Lives shown for a fresh account
const STARTING_LIVES: u32 = 5;

impl MemoryProgress {
    /// Fresh account: no XP, no coins, full lives
    pub fn new() -> Self {
        MemoryProgress {
            xp: 0,
            coins: 0,
            lives: STARTING_LIVES,
            completed: Vec::new(),
        }
    }

    /// Completed lessons in completion order
    pub fn completed(&self) -> &[CompletedLevel] {
        &self.completed
    }

    /// True if the lesson has been completed
    pub fn is_completed(&self, lesson_id: u32) -> bool {
        self.completed.iter().any(|c| c.lesson_id == lesson_id)
    }
}

impl Default for MemoryProgress {
    fn default() -> Self {
        MemoryProgress::new()
    }
}

impl Progress for MemoryProgress {
    fn add_xp_and_coins(&mut self, xp: u32, coins: u32) {
        self.xp += xp;
        self.coins += coins;
    }

    fn complete_level(
        &mut self,
        lesson_id: u32,
        xp: u32,
        coins: u32,
        stars: u32,
        time_seconds: u32,
    ) {
        self.completed.push(CompletedLevel {
            lesson_id,
            xp,
            coins,
            stars,
            time_seconds,
        });
    }

    fn xp(&self) -> u32 {
        self.xp
    }

    fn coins(&self) -> u32 {
        self.coins
    }

    fn lives(&self) -> u32 {
        self.lives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fresh_account() {
        let progress = MemoryProgress::new();
        assert_eq!(progress.xp(), 0);
        assert_eq!(progress.coins(), 0);
        assert_eq!(progress.lives(), STARTING_LIVES);
        assert!(progress.completed().is_empty());
    }

    #[test]
    fn test_totals_accumulate() {
        let mut progress = MemoryProgress::new();
        progress.add_xp_and_coins(50, 10);
        progress.add_xp_and_coins(25, 5);
        assert_eq!(progress.xp(), 75);
        assert_eq!(progress.coins(), 15);
    }

    #[test]
    fn test_completion_recorded() {
        let mut progress = MemoryProgress::new();
        progress.complete_level(3, 50, 10, 2, 120);
        assert!(progress.is_completed(3));
        assert!(!progress.is_completed(4));
        assert_eq!(progress.completed()[0].time_seconds, 120);
    }
}
