pub mod opj_fixture_builder;
