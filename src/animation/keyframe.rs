use crate::math::Quaternion;
use crate::scene::Skeleton;

/// Snapshot of every joint's local rotation at one instant.
///
/// `orientations[i]` belongs to joint `i`. Key frames are immutable once
/// built; share them between transitions through `Arc<KeyFrame>`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyFrame {
    orientations: Vec<Quaternion>,
}

impl KeyFrame {
    #[must_use]
    pub fn from_orientations(orientations: Vec<Quaternion>) -> Self {
        Self { orientations }
    }

    /// Reads the current local rotation of each joint, in joint order.
    #[must_use]
    pub fn capture(skeleton: &Skeleton) -> Self {
        let orientations = skeleton
            .joints()
            .iter()
            .filter_map(|joint| skeleton.hierarchy().get(joint.transform()))
            .map(|transform| transform.local_rotation)
            .collect();

        Self { orientations }
    }

    #[inline]
    #[must_use]
    pub fn orientations(&self) -> &[Quaternion] {
        &self.orientations
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Quaternion> {
        self.orientations.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.orientations.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orientations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Quaternion> + '_ {
        self.orientations.iter().copied()
    }
}

impl From<Vec<Quaternion>> for KeyFrame {
    fn from(orientations: Vec<Quaternion>) -> Self {
        Self::from_orientations(orientations)
    }
}

impl FromIterator<Quaternion> for KeyFrame {
    fn from_iter<I: IntoIterator<Item = Quaternion>>(iter: I) -> Self {
        Self::from_orientations(iter.into_iter().collect())
    }
}
