pub mod vitals_record;

pub use vitals_record::VitalsRecord;
