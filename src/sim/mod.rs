pub mod heat_transfer;
