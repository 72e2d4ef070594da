// ============================================================================
// HRNav Core - Access Context
// File: crates/hrnav-core/src/domain/access.rs
// Description: Roles, capabilities, and the access context the filter runs on
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Coarse permission tier. Variants are ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Role {
    Employee,
    Manager,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ORDERED: [Role; 4] = [Role::Employee, Role::Manager, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "employee" => Some(Role::Employee),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            "superadmin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// Lenient parse used at the provider boundary: unknown or missing roles
    /// fall back to the most restrictive tier.
    pub fn parse_or_restrictive(s: Option<&str>) -> Self {
        match s.and_then(Role::parse) {
            Some(role) => role,
            None => {
                warn!("Unknown role {:?}, using most restrictive", s);
                Role::most_restrictive()
            }
        }
    }

    pub fn most_restrictive() -> Self {
        Role::Employee
    }

    /// Capabilities every holder of the role has. Nested by privilege.
    pub fn baseline(&self) -> CapabilitySet {
        use Capability::*;

        let manager = [ApproveLeaves, ManageProjects, ManageTraining, ViewFeedback];
        let admin = [
            ManageEmployees,
            ManageLeaves,
            ManagePayroll,
            ViewPayrollReports,
            ManageInvoices,
            ManageAnnouncements,
            ManageRoles,
        ];

        match self {
            Role::Employee => CapabilitySet::default(),
            Role::Manager => CapabilitySet::from_iter(manager),
            Role::Admin => CapabilitySet::from_iter(manager.into_iter().chain(admin)),
            Role::SuperAdmin => CapabilitySet::from_iter(Capability::ALL),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::most_restrictive()
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::parse_or_restrictive(Some(&s))
    }
}

/// Fine-grained permission flag, orthogonal to role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    ManageEmployees,
    ApproveLeaves,
    ManageLeaves,
    ManagePayroll,
    ViewPayrollReports,
    ManageTraining,
    ManageProjects,
    ManageInvoices,
    ManageAnnouncements,
    ViewFeedback,
    ManageRoles,
    ManageCompanies,
    ManageSubscriptions,
}

impl Capability {
    pub const ALL: [Capability; 13] = [
        Capability::ManageEmployees,
        Capability::ApproveLeaves,
        Capability::ManageLeaves,
        Capability::ManagePayroll,
        Capability::ViewPayrollReports,
        Capability::ManageTraining,
        Capability::ManageProjects,
        Capability::ManageInvoices,
        Capability::ManageAnnouncements,
        Capability::ViewFeedback,
        Capability::ManageRoles,
        Capability::ManageCompanies,
        Capability::ManageSubscriptions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageEmployees => "manage-employees",
            Capability::ApproveLeaves => "approve-leaves",
            Capability::ManageLeaves => "manage-leaves",
            Capability::ManagePayroll => "manage-payroll",
            Capability::ViewPayrollReports => "view-payroll-reports",
            Capability::ManageTraining => "manage-training",
            Capability::ManageProjects => "manage-projects",
            Capability::ManageInvoices => "manage-invoices",
            Capability::ManageAnnouncements => "manage-announcements",
            Capability::ViewFeedback => "view-feedback",
            Capability::ManageRoles => "manage-roles",
            Capability::ManageCompanies => "manage-companies",
            Capability::ManageSubscriptions => "manage-subscriptions",
        }
    }

    /// Accepts kebab-case, snake_case and camelCase keys from stored profiles.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = normalize_key(key);
        Capability::ALL
            .into_iter()
            .find(|c| normalize_key(c.as_str()) == key)
    }
}

fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Closed set of granted capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn contains_all(&self, required: &BTreeSet<Capability>) -> bool {
        required.is_subset(&self.0)
    }

    pub fn insert(&mut self, capability: Capability) -> bool {
        self.0.insert(capability)
    }

    pub fn remove(&mut self, capability: Capability) -> bool {
        self.0.remove(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        CapabilitySet(iter.into_iter().collect())
    }
}

/// What the role provider returns for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSnapshot {
    #[serde(default)]
    pub role: Option<String>,
    /// Per-user capability map from the stored profile.
    #[serde(default)]
    pub capabilities: Option<BTreeMap<String, bool>>,
    #[serde(default)]
    pub is_loading: bool,
}

impl RoleSnapshot {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn for_role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Self::default()
        }
    }
}

/// Resolved input of the role filter: role tier plus per-user overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessContext {
    role: Role,
    grants: BTreeSet<Capability>,
    revokes: BTreeSet<Capability>,
    loading: bool,
}

impl AccessContext {
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            grants: BTreeSet::new(),
            revokes: BTreeSet::new(),
            loading: false,
        }
    }

    /// Placeholder used until the role lookup resolves. Behaves as the most restrictive role.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::for_role(Role::most_restrictive())
        }
    }

    pub fn from_snapshot(snapshot: &RoleSnapshot) -> Self {
        if snapshot.is_loading {
            return Self::loading();
        }
        let context = Self::for_role(Role::parse_or_restrictive(snapshot.role.as_deref()));
        match &snapshot.capabilities {
            Some(map) => context.with_capability_map(map),
            None => context,
        }
    }

    /// `true` grants a capability beyond the role baseline, `false` revokes it.
    pub fn with_capability_map(mut self, map: &BTreeMap<String, bool>) -> Self {
        for (key, allowed) in map {
            let Some(capability) = Capability::from_key(key) else {
                warn!("Ignoring unknown capability key: {}", key);
                continue;
            };
            if *allowed {
                self.revokes.remove(&capability);
                self.grants.insert(capability);
            } else {
                self.grants.remove(&capability);
                self.revokes.insert(capability);
            }
        }
        self
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The role the filter acts on; loading contexts are always most restrictive.
    pub fn effective_role(&self) -> Role {
        if self.loading {
            Role::most_restrictive()
        } else {
            self.role
        }
    }

    pub fn granted(&self) -> CapabilitySet {
        let mut granted = self.effective_role().baseline();
        if self.loading {
            return granted;
        }
        for capability in &self.grants {
            granted.insert(*capability);
        }
        for capability in &self.revokes {
            granted.remove(*capability);
        }
        granted
    }
}

impl Default for AccessContext {
    fn default() -> Self {
        Self::loading()
    }
}
