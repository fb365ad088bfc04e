// vaultsock-common: wire-protocol types shared by the console and its tests

pub mod protocol;
