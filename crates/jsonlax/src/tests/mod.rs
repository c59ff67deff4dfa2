mod parse_good;
mod shapes;
