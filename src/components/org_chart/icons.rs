use log::debug;

/// Closed set of icons a unit may reference by key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IconKey {
	/// Director.
	Crown,
	/// Security.
	Shield,
	/// Infrastructure.
	Cloud,
	/// IT and networking.
	Server,
	/// Onboarding.
	UserPlus,
	/// Documentation.
	FileText,
	/// Marketing.
	Megaphone,
	/// Fallback for unknown keys.
	#[default]
	Users,
	/// Automation and agents.
	Bot,
	/// Web and community.
	Globe,
}

const REGISTRY: &[(&str, IconKey, &str)] = &[
	("Crown", IconKey::Crown, "\u{265B}"),
	("Shield", IconKey::Shield, "\u{26E8}"),
	("Cloud", IconKey::Cloud, "\u{2601}"),
	("Server", IconKey::Server, "\u{25A4}"),
	("UserPlus", IconKey::UserPlus, "\u{271A}"),
	("FileText", IconKey::FileText, "\u{2630}"),
	("Megaphone", IconKey::Megaphone, "\u{1F4E3}"),
	("Users", IconKey::Users, "\u{1F465}"),
	("Bot", IconKey::Bot, "\u{1F916}"),
	("Globe", IconKey::Globe, "\u{1F310}"),
];

impl IconKey {
	/// Looks up `key`, falling back to the default icon when it is not registered.
	pub fn resolve(key: &str) -> Self {
		match REGISTRY.iter().find(|(name, _, _)| *name == key) {
			Some(&(_, icon, _)) => icon,
			None => {
				debug!("icon key {key:?} not in registry, using default");
				IconKey::default()
			}
		}
	}

	fn entry(self) -> &'static (&'static str, IconKey, &'static str) {
		// every variant has a registry row
		REGISTRY
			.iter()
			.find(|(_, icon, _)| *icon == self)
			.unwrap_or(&REGISTRY[7])
	}

	/// Key as written in org documents.
	pub fn key(self) -> &'static str {
		self.entry().0
	}

	/// Character drawn on the node card.
	pub fn glyph(self) -> &'static str {
		self.entry().2
	}
}
