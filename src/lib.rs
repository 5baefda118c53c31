pub mod evolve;
