pub mod starboard;
