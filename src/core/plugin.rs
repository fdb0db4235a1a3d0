//! Plugin metadata for the compiled-in adapters
//!
//! Each adapter implements [`Plugin`] so the host can surface a uniform
//! `name/slug/provider_slug/description` record, and [`AdapterKind`]
//! resolves slugs back to the variant they belong to.

use serde::Serialize;

/// Metadata contract shared by every adapter
pub trait Plugin {
    /// Human-readable adapter name
    fn name(&self) -> &'static str;

    /// Stable identifier the host stores and routes on
    fn slug(&self) -> &'static str;

    /// Identifier of the external provider this adapter fronts
    fn provider_slug(&self) -> &'static str;

    /// One-line description of what the adapter does
    fn description(&self) -> &'static str;
}

/// The compiled-in adapter variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    DeviceLogin,
    ChatCompletions,
}

/// Static metadata record for one adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub slug: &'static str,
    pub provider_slug: &'static str,
    pub description: &'static str,
}

impl AdapterKind {
    pub const ALL: [AdapterKind; 2] = [AdapterKind::DeviceLogin, AdapterKind::ChatCompletions];

    /// Resolve a stored slug back to its adapter
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "device_login" => Some(AdapterKind::DeviceLogin),
            "chat_completions" => Some(AdapterKind::ChatCompletions),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        self.descriptor().slug
    }

    pub fn descriptor(self) -> PluginDescriptor {
        match self {
            AdapterKind::DeviceLogin => PluginDescriptor {
                name: "Device Login",
                slug: "device_login",
                provider_slug: "ssh",
                description: "Verify login credentials against a network device",
            },
            AdapterKind::ChatCompletions => PluginDescriptor {
                name: "Chat Completions",
                slug: "chat_completions",
                provider_slug: "localai",
                description: "Chat completions from an OpenAI-compatible endpoint",
            },
        }
    }
}

/// Catalog of every compiled-in adapter, for host display and lookup
pub fn builtin() -> Vec<PluginDescriptor> {
    AdapterKind::ALL.iter().map(|kind| kind.descriptor()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slug_resolves_both_adapters() {
        assert_eq!(
            AdapterKind::from_slug("device_login"),
            Some(AdapterKind::DeviceLogin)
        );
        assert_eq!(
            AdapterKind::from_slug("chat_completions"),
            Some(AdapterKind::ChatCompletions)
        );
        assert_eq!(AdapterKind::from_slug("spreadsheet_export"), None);
    }

    #[test]
    fn test_builtin_catalog_lists_every_adapter() {
        let catalog = builtin();
        assert_eq!(catalog.len(), AdapterKind::ALL.len());
        for descriptor in catalog {
            assert_eq!(
                AdapterKind::from_slug(descriptor.slug).map(|kind| kind.descriptor()),
                Some(descriptor)
            );
        }
    }
}
