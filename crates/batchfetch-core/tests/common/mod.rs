pub mod path_server;
