//! Member registry: the ordered set of team members.

use crate::domain::{MemberId, NewMember, TeamMember, ValidationError};
use crate::ports::IdGenerator;

/// Owns every registered member, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemberRegistry {
    members: Vec<TeamMember>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the required fields of `input` (name and email).
    pub fn validate(input: &NewMember) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if input.name.trim().is_empty() {
            missing.push("name");
        }
        if input.email.trim().is_empty() {
            missing.push("email");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    /// Register a new member. The id is only allocated once validation
    /// passes.
    pub fn add(
        &mut self,
        input: NewMember,
        ids: &dyn IdGenerator,
    ) -> Result<&TeamMember, ValidationError> {
        Self::validate(&input)?;
        let member = TeamMember {
            id: ids.generate_member_id(),
            name: input.name.trim().to_string(),
            role: input.role,
            email: input.email.trim().to_string(),
            level: input.level,
        };
        Ok(self.push(member))
    }

    /// Insert a member that already carries an id (sample data).
    pub(crate) fn insert(&mut self, member: TeamMember) -> &TeamMember {
        self.push(member)
    }

    /// Remove a member. Returns `None` if the id is unknown.
    ///
    /// This only touches the registry; unassigning the member's tasks is the
    /// caller's half of the cascade.
    pub fn remove(&mut self, id: MemberId) -> Option<TeamMember> {
        let index = self.members.iter().position(|m| m.id == id)?;
        Some(self.members.remove(index))
    }

    pub fn get(&self, id: MemberId) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.get(id).is_some()
    }

    pub fn name_of(&self, id: MemberId) -> Option<&str> {
        self.get(id).map(|m| m.name.as_str())
    }

    pub fn list(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn push(&mut self, member: TeamMember) -> &TeamMember {
        self.members.push(member);
        &self.members[self.members.len() - 1]
    }
}
