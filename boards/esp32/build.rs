fn main() {
    // Propagate the ESP-IDF build environment (linker args, cfgs) to rustc
    embuild::espidf::sysenv::output();
}
