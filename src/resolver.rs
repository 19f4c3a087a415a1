//! Case-insensitive name resolution.
//!
//! The planner rarely reproduces catalog names exactly ("pick up the cup"
//! when the catalog says `Cup`). [`NameResolver`] maps planner text onto the
//! canonical names stored in a [`WorldState`]. When nothing matches, the
//! planner's text is used verbatim so invented names still flow through.

use crate::WorldState;

/// Compares two names ignoring case.
pub fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Read-only lookup service over the locations, location contents and held
/// items of a world state.
///
/// # Examples
///
/// ```
/// use esmrs::{Catalog, WorldState};
/// use esmrs::resolver::NameResolver;
///
/// let state = WorldState::from_catalog(&Catalog::new("Hall", [
///     ("Hall", vec!["Umbrella"]),
///     ("Kitchen", vec!["Cup"]),
/// ]));
/// let resolver = NameResolver::new(&state);
///
/// assert_eq!(resolver.location("KITCHEN"), "Kitchen");
/// assert_eq!(resolver.location("garage"), "garage");
/// assert_eq!(resolver.item("cup", Some("Hall")), "Cup");
/// assert_eq!(resolver.find_item("umbrella"), Some(("Umbrella", "Hall")));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    state: &'a WorldState,
}

impl<'a> NameResolver<'a> {
    pub fn new(state: &'a WorldState) -> Self {
        Self { state }
    }

    /// Canonical name of a known location, if any.
    pub fn known_location(&self, name: &str) -> Option<&'a str> {
        self.state
            .environment
            .keys()
            .find(|location| same_name(location, name))
            .map(String::as_str)
    }

    /// Canonical location name, or `name` itself when no location matches.
    pub fn location(&self, name: &str) -> String {
        match self.known_location(name) {
            Some(location) => location.to_string(),
            None => {
                log::debug!("Location '{}' is not in the environment, using it verbatim", name);
                name.to_string()
            }
        }
    }

    /// Canonical item name.
    ///
    /// Looks in `scope` first (when given), then in every location in
    /// catalog order, then in the robot's hands. Falls back to `name`.
    pub fn item(&self, name: &str, scope: Option<&str>) -> String {
        let scoped = scope
            .and_then(|location| self.state.environment.get(location))
            .and_then(|items| items.iter().find(|item| same_name(item, name)))
            .map(String::as_str);
        let found = scoped
            .or_else(|| self.find_item(name).map(|(item, _)| item))
            .or_else(|| self.held_item(name));
        match found {
            Some(item) => item.to_string(),
            None => {
                log::debug!("Item '{}' is not known, using it verbatim", name);
                name.to_string()
            }
        }
    }

    /// First location (in catalog order) containing a matching item, as
    /// `(item, location)` with canonical names.
    pub fn find_item(&self, name: &str) -> Option<(&'a str, &'a str)> {
        self.state.environment.iter().find_map(|(location, items)| {
            items
                .iter()
                .find(|item| same_name(item, name))
                .map(|item| (item.as_str(), location.as_str()))
        })
    }

    /// Canonical name of a matching held item.
    pub fn held_item(&self, name: &str) -> Option<&'a str> {
        self.state
            .robot_status
            .holding
            .iter()
            .find(|item| same_name(item, name))
            .map(String::as_str)
    }

    /// Returns `true` if `a` and `b` resolve to the same location.
    pub fn same_location(&self, a: &str, b: &str) -> bool {
        same_name(&self.location(a), &self.location(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    fn state() -> WorldState {
        let mut state = WorldState::from_catalog(&Catalog::new(
            "LivingRoom",
            [
                ("Kitchen", vec!["Cup", "Fork"]),
                ("Dining Table", vec!["Plate"]),
                ("LivingRoom", vec![]),
            ],
        ));
        state.robot_status.holding.push("Remote".to_string());
        state
    }

    #[test]
    fn test_same_name() {
        assert!(same_name("Cup", "cUP"));
        assert!(same_name("ÉCLAIR", "éclair"));
        assert!(!same_name("Cup", "Cups"));
    }

    #[test]
    fn test_location_resolution() {
        let state = state();
        let resolver = NameResolver::new(&state);
        assert_eq!(resolver.location("dining table"), "Dining Table");
        assert_eq!(resolver.location("Attic"), "Attic");
        assert_eq!(resolver.known_location("attic"), None);
        assert!(resolver.same_location("kitchen", "KITCHEN"));
        assert!(!resolver.same_location("kitchen", "LivingRoom"));
    }

    #[test]
    fn test_item_resolution_order() {
        let state = state();
        let resolver = NameResolver::new(&state);
        assert_eq!(resolver.item("fork", Some("Kitchen")), "Fork");
        assert_eq!(resolver.item("plate", Some("Kitchen")), "Plate");
        assert_eq!(resolver.item("remote", None), "Remote");
        assert_eq!(resolver.item("spoon", Some("Kitchen")), "spoon");
        assert_eq!(resolver.item("cup", Some("Nowhere")), "Cup");
    }

    #[test]
    fn test_find_item() {
        let state = state();
        let resolver = NameResolver::new(&state);
        assert_eq!(resolver.find_item("PLATE"), Some(("Plate", "Dining Table")));
        assert_eq!(resolver.find_item("remote"), None);
        assert_eq!(resolver.held_item("REMOTE"), Some("Remote"));
    }
}
