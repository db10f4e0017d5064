use crate::models::{PartyDetails, PartyRecord};

/// Repository interface for the party directory.
///
/// The engine does not own identity: callers are authenticated upstream and
/// arrive as opaque party ids. This trait maintains the minimal projection of
/// the identity system the auction logic needs, namely each party's role and
/// display data. Every guarded operation consults it to decide whether the
/// caller is a warehouse or a factory.
pub trait PartyRepository: super::Repository {
    /// Fetch a party's directory entry.
    ///
    /// # Returns
    ///
    /// The entry if the party is known, None otherwise.
    fn get_party(
        &self,
        party_id: Self::PartyId,
    ) -> impl Future<Output = Result<Option<PartyRecord<Self>>, Self::Error>> + Send;

    /// Create or replace a party's directory entry.
    ///
    /// Upserts are last-write-wins; the entry's `updated_at` is set to
    /// `as_of`. Changing a party's role does not retroactively touch any
    /// requests or bids it already owns.
    fn upsert_party(
        &self,
        party_id: Self::PartyId,
        details: PartyDetails,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
