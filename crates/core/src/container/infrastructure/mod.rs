pub mod gif_container_writer;
pub mod writer_factory;
