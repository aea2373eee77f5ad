use crate::client::Suggestion;
use crate::types::Location;

/// Identifies one asynchronous step. Every input change or selection issues a
/// new generation, so results carrying an older ticket are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug, PartialEq)]
pub enum ResolverState {
	/// The places capability is not available yet.
	Disabled,
	/// Nothing pending and nothing picked.
	Ready,
	/// Waiting for the debounce period or for suggestions of `query`.
	Pending { query: String },
	Suggestions(Vec<Suggestion>),
	/// Looking up the coordinates (or node) of `description`.
	Resolving { description: String },
	Resolved(Location),
}

/// State machine behind one location field.
///
/// Driven only by input changes, arriving suggestions, selections and
/// resolution outcomes; timers and network calls live in the component.
#[derive(Clone, Debug)]
pub struct LocationResolver {
	state: ResolverState,
	text: String,
	error: Option<String>,
	generation: u64,
	suggest: bool,
}

impl LocationResolver {
	/// Resolver with an autocomplete list, disabled until [`Self::enable`].
	pub fn with_suggestions() -> Self {
		Self {
			state: ResolverState::Disabled,
			text: String::new(),
			error: None,
			generation: 0,
			suggest: true,
		}
	}

	/// Resolver that geocodes the whole address on submit, with no list.
	pub fn direct() -> Self {
		Self {
			state: ResolverState::Ready,
			suggest: false,
			..Self::with_suggestions()
		}
	}

	pub fn state(&self) -> &ResolverState {
		&self.state
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	pub fn resolved(&self) -> Option<&Location> {
		match &self.state {
			ResolverState::Resolved(loc) => Some(loc),
			_ => None,
		}
	}

	pub fn suggestions(&self) -> &[Suggestion] {
		match &self.state {
			ResolverState::Suggestions(list) => list,
			_ => &[],
		}
	}

	pub fn is_busy(&self) -> bool {
		matches!(
			self.state,
			ResolverState::Pending { .. } | ResolverState::Resolving { .. }
		)
	}

	fn next_ticket(&mut self) -> Ticket {
		self.generation += 1;
		Ticket(self.generation)
	}

	fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.generation
	}

	pub fn enable(&mut self) {
		if self.state == ResolverState::Disabled {
			self.state = ResolverState::Ready;
		}
	}

	/// Records new text. Returns the ticket to arm the debounce timer with when
	/// a suggestion request should follow.
	pub fn input_changed(&mut self, text: String) -> Option<Ticket> {
		let ticket = self.next_ticket();
		self.error = None;
		let query = text.trim().to_owned();
		self.text = text;
		if self.state == ResolverState::Disabled {
			return None;
		}
		if query.is_empty() || !self.suggest {
			self.state = ResolverState::Ready;
			return None;
		}
		self.state = ResolverState::Pending { query };
		Some(ticket)
	}

	/// Query to send once the quiet period for `ticket` has passed.
	pub fn debounce_elapsed(&self, ticket: Ticket) -> Option<String> {
		match &self.state {
			ResolverState::Pending { query } if self.is_current(ticket) => Some(query.clone()),
			_ => None,
		}
	}

	pub fn suggestions_arrived(&mut self, ticket: Ticket, list: Vec<Suggestion>) -> bool {
		if !self.is_current(ticket) || !matches!(self.state, ResolverState::Pending { .. }) {
			return false;
		}
		self.state = ResolverState::Suggestions(list);
		true
	}

	pub fn suggestions_failed(&mut self, ticket: Ticket) -> bool {
		if !self.is_current(ticket) || !matches!(self.state, ResolverState::Pending { .. }) {
			return false;
		}
		self.state = ResolverState::Ready;
		true
	}

	/// Picks suggestion `index`; the returned suggestion must be resolved.
	pub fn select(&mut self, index: usize) -> Option<(Ticket, Suggestion)> {
		let picked = self.suggestions().get(index)?.clone();
		let ticket = self.next_ticket();
		self.text = picked.description.clone();
		self.state = ResolverState::Resolving {
			description: picked.description.clone(),
		};
		Some((ticket, picked))
	}

	/// Submits the typed address for direct resolution.
	pub fn submit(&mut self) -> Option<(Ticket, String)> {
		if self.suggest || self.state == ResolverState::Disabled {
			return None;
		}
		let address = self.text.trim().to_owned();
		if address.is_empty() {
			return None;
		}
		let ticket = self.next_ticket();
		self.error = None;
		self.state = ResolverState::Resolving {
			description: address.clone(),
		};
		Some((ticket, address))
	}

	pub fn resolution_succeeded(&mut self, ticket: Ticket, location: Location) -> bool {
		if !self.is_current(ticket) || !matches!(self.state, ResolverState::Resolving { .. }) {
			return false;
		}
		self.state = ResolverState::Resolved(location);
		true
	}

	pub fn resolution_failed(&mut self, ticket: Ticket, message: String) -> bool {
		if !self.is_current(ticket) || !matches!(self.state, ResolverState::Resolving { .. }) {
			return false;
		}
		if self.suggest {
			self.text.clear();
		}
		self.error = Some(message);
		self.state = ResolverState::Ready;
		true
	}

	/// Abandons every outstanding step, e.g. when the field is torn down.
	pub fn cancel(&mut self) {
		self.next_ticket();
		if self.is_busy() {
			self.state = ResolverState::Ready;
		}
	}
}
