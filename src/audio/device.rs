use std::fmt;

/// An active render endpoint as reported by the audio subsystem.
///
/// `id` is the stable endpoint id; `name` is the friendly name shown to the
/// user and is not guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
}

impl AudioDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for AudioDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// The default-device contexts an endpoint can be assigned to.
///
/// Discriminants match the platform's `ERole` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Console = 0,
    Multimedia = 1,
    Communications = 2,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Console, Role::Multimedia, Role::Communications];

    /// Role used to decide which device is "the" current default.
    pub const REPRESENTATIVE: Role = Role::Multimedia;

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Console => write!(f, "console"),
            Role::Multimedia => write!(f, "multimedia"),
            Role::Communications => write!(f, "communications"),
        }
    }
}

/// Fixed-size set of roles. Iteration always yields roles in
/// console, multimedia, communications order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet([bool; 3]);

impl RoleSet {
    pub const ALL: RoleSet = RoleSet([true; 3]);
    pub const EMPTY: RoleSet = RoleSet([false; 3]);

    pub fn with(mut self, role: Role) -> Self {
        self.0[role.index()] = true;
        self
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0[role.index()]
    }

    pub fn len(&self) -> usize {
        self.0.iter().filter(|set| **set).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(RoleSet::EMPTY, RoleSet::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_set_iterates_in_canonical_order() {
        let set: RoleSet = [Role::Communications, Role::Console].into_iter().collect();

        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Role::Console, Role::Communications]
        );
        assert_eq!(set.len(), 2);
        assert!(!set.contains(Role::Multimedia));
    }

    #[test]
    fn test_role_set_all() {
        assert_eq!(RoleSet::ALL.iter().collect::<Vec<_>>(), Role::ALL.to_vec());
        assert!(RoleSet::EMPTY.is_empty());
    }

    #[test]
    fn test_role_discriminants_match_platform() {
        assert_eq!(Role::Console as i32, 0);
        assert_eq!(Role::Multimedia as i32, 1);
        assert_eq!(Role::Communications as i32, 2);
    }
}
