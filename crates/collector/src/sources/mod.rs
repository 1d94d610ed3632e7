pub mod gamba;
