pub mod mock_particle;
pub mod particle;
