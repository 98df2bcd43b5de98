pub mod swap_session;
