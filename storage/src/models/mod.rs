mod dialog_record;
mod referral;

pub use dialog_record::DialogRecord;
pub use referral::ReferralEdge;
