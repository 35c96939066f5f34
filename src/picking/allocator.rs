//! Sequential id assignment

use super::{encode, ObjectId, PickTag, Pickable, PickingError, MAX_ID};

/// Numbers objects in registry order starting at a fixed base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    base: u32,
}

impl IdAllocator {
    pub const DEFAULT_BASE: u32 = 1000;

    /// `base` must be non-zero; 0 is [`ObjectId::NO_SELECTION`].
    pub fn new(base: u32) -> Result<Self, PickingError> {
        if base == 0 {
            return Err(PickingError::ReservedBaseOffset);
        }
        if base > MAX_ID {
            return Err(PickingError::IdOutOfRange { id: base });
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Id the object at `index` receives.
    pub fn id_for(&self, index: usize) -> Result<ObjectId, PickingError> {
        let available = MAX_ID - self.base + 1;
        match u32::try_from(index) {
            Ok(offset) if offset < available => Ok(ObjectId(self.base + offset)),
            _ => Err(PickingError::IdSpaceExhausted {
                requested: index.saturating_add(1),
                available,
            }),
        }
    }

    /// Assigns `base + index` and its colour to every object.
    ///
    /// Fails before touching any object if the registry does not fit. Running
    /// it again over the same order hands out the same tags.
    pub fn allocate<P: Pickable>(&self, objects: &mut [P]) -> Result<(), PickingError> {
        if let Some(last) = objects.len().checked_sub(1) {
            self.id_for(last)?;
        }

        for (index, object) in objects.iter_mut().enumerate() {
            let id = self.id_for(index)?;
            object.set_pick_tag(PickTag {
                id,
                color: encode(id)?,
            });
        }

        log::debug!(
            "numbered {} objects from {} to {}",
            objects.len(),
            self.base,
            self.base as usize + objects.len().saturating_sub(1)
        );
        Ok(())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::RenderBackend;
    use crate::picking::decode;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    #[derive(Default, Clone)]
    struct Slot {
        tag: PickTag,
    }

    impl Pickable for Slot {
        fn pick_tag(&self) -> PickTag {
            self.tag
        }

        fn set_pick_tag(&mut self, tag: PickTag) {
            self.tag = tag;
        }

        fn draw_flat(&self, _backend: &mut dyn RenderBackend) {}

        fn interact(&mut self) {}
    }

    #[test]
    fn test_sequential_from_base() {
        let mut objects = vec![Slot::default(); 3];
        IdAllocator::default().allocate(&mut objects).unwrap();

        let ids: Vec<u32> = objects.iter().map(|o| o.tag.id.get()).collect();
        assert_eq!(ids, vec![1000, 1001, 1002]);
        for object in &objects {
            assert_eq!(decode(object.tag.color.to_rgba8()), object.tag.id);
        }
    }

    #[test]
    fn test_ids_pairwise_distinct() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x1d);
        for _ in 0..20 {
            let len = rng.random_range(0..5000);
            let base = rng.random_range(1..=MAX_ID - 5000);
            let mut objects = vec![Slot::default(); len];
            IdAllocator::new(base).unwrap().allocate(&mut objects).unwrap();

            let ids: HashSet<ObjectId> = objects.iter().map(|o| o.tag.id).collect();
            let colors: HashSet<_> = objects.iter().map(|o| o.tag.color).collect();
            assert_eq!(ids.len(), len);
            assert_eq!(colors.len(), len);
            assert!(!ids.contains(&ObjectId::NO_SELECTION));
        }
    }

    #[test]
    fn test_reallocation_is_stable() {
        let allocator = IdAllocator::default();
        let mut objects = vec![Slot::default(); 5];
        allocator.allocate(&mut objects).unwrap();
        let first: Vec<PickTag> = objects.iter().map(|o| o.tag).collect();
        allocator.allocate(&mut objects).unwrap();
        let second: Vec<PickTag> = objects.iter().map(|o| o.tag).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_base_rejected() {
        assert_eq!(IdAllocator::new(0), Err(PickingError::ReservedBaseOffset));
    }

    #[test]
    fn test_exhaustion_leaves_objects_untouched() {
        let allocator = IdAllocator::new(MAX_ID - 1).unwrap();

        let mut fits = vec![Slot::default(); 2];
        allocator.allocate(&mut fits).unwrap();
        assert_eq!(fits[1].tag.id, ObjectId(MAX_ID));

        let mut too_many = vec![Slot::default(); 3];
        assert_eq!(
            allocator.allocate(&mut too_many),
            Err(PickingError::IdSpaceExhausted {
                requested: 3,
                available: 2
            })
        );
        assert!(too_many.iter().all(|o| o.tag == PickTag::UNASSIGNED));
    }

    #[test]
    fn test_empty_registry() {
        let mut objects: Vec<Slot> = Vec::new();
        assert!(IdAllocator::default().allocate(&mut objects).is_ok());
    }
}
