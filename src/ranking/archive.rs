//! Bounded crowded archive.

use std::cmp::Ordering;

use crate::core::{attr, Solution, Variable};
use crate::error::ConfigError;
use crate::ranking::dominance::dominance_compare;
use crate::ranking::sorting::crowding_distance;

/// Bounded store of mutually non-dominated solutions.
///
/// Insertion rejects dominated candidates and exact objective duplicates,
/// evicts members the candidate dominates, and once capacity is exceeded
/// drops the member with the smallest crowding distance. SMPSO keeps its
/// leaders here; hosts can also use it to track an elite set.
#[derive(Debug, Clone)]
pub struct CrowdedArchive<T: Variable> {
    capacity: usize,
    members: Vec<Solution<T>>,
}

impl<T: Variable> CrowdedArchive<T> {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ArchiveCapacity);
        }
        Ok(Self {
            capacity,
            members: Vec::with_capacity(capacity + 1),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contents(&self) -> &[Solution<T>] {
        &self.members
    }

    pub fn into_contents(self) -> Vec<Solution<T>> {
        self.members
    }

    /// Inserts `candidate` unless a member dominates it or duplicates its
    /// objectives. Members the candidate dominates are evicted; when the
    /// archive overflows, the most crowded member goes. Returns whether the
    /// candidate is in the archive afterwards.
    pub fn try_insert(&mut self, candidate: Solution<T>) -> bool {
        for member in &self.members {
            match dominance_compare(member, &candidate) {
                Ordering::Less => return false,
                Ordering::Equal if member.objectives() == candidate.objectives() => return false,
                _ => {}
            }
        }

        self.members
            .retain(|member| dominance_compare(&candidate, member) != Ordering::Less);
        self.members.push(candidate);

        if self.members.len() > self.capacity {
            self.refresh_crowding();
            let worst = self
                .members
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    let da = a.attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
                    let db = b.attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
                    da.total_cmp(&db)
                })
                .map(|(i, _)| i)
                .expect("archive over capacity cannot be empty");
            let evicted_candidate = worst == self.members.len() - 1;
            self.members.remove(worst);
            return !evicted_candidate;
        }
        true
    }

    /// Recomputes crowding distances over the members, storing them as
    /// attributes for leader selection.
    pub fn refresh_crowding(&mut self) {
        let distances = crowding_distance(&self.members);
        for (member, distance) in self.members.iter_mut().zip(distances) {
            member.set_attribute(attr::CROWDING_DISTANCE, distance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(objectives: &[f64]) -> Solution<f64> {
        let mut s = Solution::new(vec![0.0], objectives.len(), 0);
        s.objectives_mut().copy_from_slice(objectives);
        s
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            CrowdedArchive::<f64>::new(0).unwrap_err(),
            ConfigError::ArchiveCapacity
        );
    }

    #[test]
    fn non_dominated_candidates_accumulate() {
        let mut archive = CrowdedArchive::new(10).unwrap();
        assert!(archive.try_insert(solution(&[1.0, 4.0])));
        assert!(archive.try_insert(solution(&[4.0, 1.0])));
        assert!(archive.try_insert(solution(&[2.0, 2.0])));
        assert_eq!(archive.len(), 3);
    }

    #[test]
    fn dominated_candidates_are_rejected() {
        let mut archive = CrowdedArchive::new(10).unwrap();
        archive.try_insert(solution(&[1.0, 1.0]));
        assert!(!archive.try_insert(solution(&[2.0, 2.0])));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn dominating_candidates_evict_members() {
        let mut archive = CrowdedArchive::new(10).unwrap();
        archive.try_insert(solution(&[3.0, 3.0]));
        archive.try_insert(solution(&[4.0, 2.0]));
        assert!(archive.try_insert(solution(&[1.0, 1.0])));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.contents()[0].objectives(), &[1.0, 1.0]);
    }

    #[test]
    fn objective_duplicates_are_rejected() {
        let mut archive = CrowdedArchive::new(10).unwrap();
        archive.try_insert(solution(&[1.0, 4.0]));
        assert!(!archive.try_insert(solution(&[1.0, 4.0])));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn overflow_evicts_the_most_crowded_member() {
        let mut archive = CrowdedArchive::new(3).unwrap();
        archive.try_insert(solution(&[0.0, 10.0]));
        archive.try_insert(solution(&[10.0, 0.0]));
        archive.try_insert(solution(&[5.0, 5.0]));
        // the newcomer crowds in next to [5,5]; one of the interior pair
        // must go while both boundary members survive
        archive.try_insert(solution(&[5.5, 4.5]));
        assert_eq!(archive.len(), 3);
        let objectives: Vec<&[f64]> = archive.contents().iter().map(|s| s.objectives()).collect();
        assert!(objectives.contains(&&[0.0, 10.0][..]));
        assert!(objectives.contains(&&[10.0, 0.0][..]));
    }

    #[test]
    fn insert_reports_candidate_survival() {
        let mut archive = CrowdedArchive::new(2).unwrap();
        assert!(archive.try_insert(solution(&[0.0, 10.0])));
        assert!(archive.try_insert(solution(&[10.0, 0.0])));
        // interior candidate on a full boundary-only archive evicts itself
        assert!(!archive.try_insert(solution(&[5.0, 5.0])));
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn refresh_crowding_marks_boundaries_infinite() {
        let mut archive = CrowdedArchive::new(5).unwrap();
        archive.try_insert(solution(&[1.0, 4.0]));
        archive.try_insert(solution(&[2.0, 3.0]));
        archive.try_insert(solution(&[4.0, 1.0]));
        archive.refresh_crowding();
        let infinite = archive
            .contents()
            .iter()
            .filter(|s| s.attribute(attr::CROWDING_DISTANCE) == Some(f64::INFINITY))
            .count();
        assert_eq!(infinite, 2);
    }
}
