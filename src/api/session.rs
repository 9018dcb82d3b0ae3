use std::sync::{Arc, PoisonError, RwLock};

/// Bearer credential shared between the shell and the API client.
///
/// Clones share the same slot. Nothing is persisted, so a page reload
/// always starts logged out.
#[derive(Clone, Debug, Default)]
pub struct Session {
	token: Arc<RwLock<Option<String>>>,
}

impl Session {
	/// An empty session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current token, if one has been set.
	pub fn get(&self) -> Option<String> {
		self.token
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Replaces the token unconditionally.
	pub fn set(&self, token: impl Into<String>) {
		*self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
	}

	/// Forgets the token.
	pub fn clear(&self) {
		*self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
	}

	/// Whether requests will carry an `Authorization` header.
	pub fn is_set(&self) -> bool {
		self.token
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clones_share_the_credential() {
		let session = Session::new();
		let client_view = session.clone();
		assert!(!client_view.is_set());

		session.set("abc");
		assert_eq!(client_view.get().as_deref(), Some("abc"));

		session.set("def");
		assert_eq!(client_view.get().as_deref(), Some("def"));

		client_view.clear();
		assert_eq!(session.get(), None);
	}
}
