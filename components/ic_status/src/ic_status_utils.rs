//! Variant list algebra shared by status types
//!
//! Status types keep a short list of variants, at most one per receiver
//! shape. These helpers grow, narrow and inspect such lists without ever
//! letting two variants claim the same shape.

use arrayvec::ArrayVec;
use core_types::CacheableIdentifier;
use memory_manager::ShapeSet;

use crate::get_by_variant::GetByVariant;

/// Most variants a status keeps before giving up on per-shape detail
pub const MAX_VARIANTS: usize = 8;

/// Bounded list of variants
pub type VariantList<V> = ArrayVec<V, MAX_VARIANTS>;

/// A variant that can live in a [`VariantList`]
pub trait StatusVariant: Clone {
    /// Fold `other` into `self`; false leaves `self` unchanged
    fn attempt_to_merge(&mut self, other: &Self) -> bool;

    /// Whether both could claim the same receiver
    fn overlaps(&self, other: &Self) -> bool;

    /// Receiver shapes
    fn structure_set(&self) -> &ShapeSet;

    /// Mutable receiver shapes
    fn structure_set_mut(&mut self) -> &mut ShapeSet;

    /// Property the variant answers for
    fn identifier(&self) -> Option<&CacheableIdentifier>;
}

impl StatusVariant for GetByVariant {
    fn attempt_to_merge(&mut self, other: &Self) -> bool {
        GetByVariant::attempt_to_merge(self, other)
    }

    fn overlaps(&self, other: &Self) -> bool {
        GetByVariant::overlaps(self, other)
    }

    fn structure_set(&self) -> &ShapeSet {
        GetByVariant::structure_set(self)
    }

    fn structure_set_mut(&mut self) -> &mut ShapeSet {
        GetByVariant::structure_set_mut(self)
    }

    fn identifier(&self) -> Option<&CacheableIdentifier> {
        GetByVariant::identifier(self)
    }
}

/// Add `variant` to `variants`, merging it into a compatible entry if one
/// exists.
///
/// Fails without touching the list when the merged entry would overlap
/// another entry, when the variant overlaps an entry it cannot merge with,
/// or when the list is full.
pub fn append_ic_status_variant<V: StatusVariant>(variants: &mut VariantList<V>, variant: V) -> bool {
    for i in 0..variants.len() {
        let mut merged = variants[i].clone();
        if !merged.attempt_to_merge(&variant) {
            continue;
        }
        let collides = variants
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && other.overlaps(&merged));
        if collides {
            return false;
        }
        variants[i] = merged;
        return true;
    }

    if variants.iter().any(|existing| existing.overlaps(&variant)) {
        return false;
    }
    variants.try_push(variant).is_ok()
}

/// Narrow every variant to `set`, dropping the ones left without shapes.
pub fn filter_ic_status_variants<V: StatusVariant>(variants: &mut VariantList<V>, set: &ShapeSet) {
    variants.retain(|variant| {
        variant.structure_set_mut().filter(set);
        !variant.structure_set().is_empty()
    });
}

/// The identifier shared by every variant, if they all have the same one.
pub fn single_identifier_for_ic_status<V: StatusVariant>(
    variants: &[V],
) -> Option<CacheableIdentifier> {
    let (first, rest) = variants.split_first()?;
    let result = first.identifier()?;
    for variant in rest {
        if variant.identifier()? != result {
            return None;
        }
    }
    Some(result.clone())
}
