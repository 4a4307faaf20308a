//! Deployment tests.
//!
//! The error-path tests run offline; the deployment tests need a running
//! local dev node (`anvil` or `npx hardhat node`) and are ignored by
//! default, run them with `cargo test -- --ignored`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use devnode_test::errors::DevNodeError;
use devnode_test::{
    deploy_contract, deploy_contract_upgradeable, deploy_contract_upgradeable_with_lib,
    ArtifactStore, ContractDeployment, ContractDeploymentWithLib, DevNode, TestEOA,
};
use ethers::types::U256;

// Constructor-less fixture whose runtime code answers every call with 42.
const ANSWER_ARTIFACT: &str = r#"{
    "_format": "hh-sol-artifact-1",
    "contractName": "Answer",
    "sourceName": "contracts/Answer.sol",
    "abi": [
        {
            "inputs": [],
            "name": "get",
            "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
            "stateMutability": "view",
            "type": "function"
        }
    ],
    "bytecode": "0x600a600c600039600a6000f3602a60805260206080f3",
    "linkReferences": {},
    "deployedLinkReferences": {}
}"#;

const UNLINKED_ARTIFACT: &str = r#"{
    "_format": "hh-sol-artifact-1",
    "contractName": "Vault",
    "sourceName": "contracts/Vault.sol",
    "abi": [],
    "bytecode": "0x6060__$1234567890123456789012345678901234$__00",
    "linkReferences": {
        "contracts/MathLib.sol": {
            "MathLib": [{ "length": 20, "start": 2 }]
        }
    },
    "deployedLinkReferences": {}
}"#;

// Library fixture, deployable on its own; the runtime answers 42.
const MATH_LIB_ARTIFACT: &str = r#"{
    "_format": "hh-sol-artifact-1",
    "contractName": "MathLib",
    "sourceName": "contracts/MathLib.sol",
    "abi": [],
    "bytecode": "0x600a600c600039600a6000f3602a60805260206080f3",
    "linkReferences": {},
    "deployedLinkReferences": {}
}"#;

// Initializable fixture whose runtime pushes the linked library address
// (PUSH20 at byte 13, the placeholder region) before answering 42.
const LINKED_BOX_ARTIFACT: &str = r#"{
    "_format": "hh-sol-artifact-1",
    "contractName": "LinkedBox",
    "sourceName": "contracts/LinkedBox.sol",
    "abi": [
        {
            "inputs": [{ "internalType": "uint256", "name": "value", "type": "uint256" }],
            "name": "initialize",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ],
    "bytecode": "0x6020600c60003960206000f373__$1234567890123456789012345678901234$__50602a60805260206080f3",
    "linkReferences": {
        "contracts/MathLib.sol": {
            "MathLib": [{ "length": 20, "start": 13 }]
        }
    },
    "deployedLinkReferences": {}
}"#;

// Stand-in for the OpenZeppelin proxy artifact: same constructor surface,
// trivial runtime. Real projects get this from @openzeppelin/contracts.
const PROXY_ARTIFACT: &str = r#"{
    "_format": "hh-sol-artifact-1",
    "contractName": "ERC1967Proxy",
    "sourceName": "@openzeppelin/contracts/proxy/ERC1967/ERC1967Proxy.sol",
    "abi": [
        {
            "inputs": [
                { "internalType": "address", "name": "implementation", "type": "address" },
                { "internalType": "bytes", "name": "_data", "type": "bytes" }
            ],
            "stateMutability": "payable",
            "type": "constructor"
        }
    ],
    "bytecode": "0x600a600c600039600a6000f3602a60805260206080f3",
    "linkReferences": {},
    "deployedLinkReferences": {}
}"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_artifact(dir: &Path, rel_path: &str, contents: &str) {
    let path = dir.join(rel_path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn setup_store(dir: &Path) -> ArtifactStore {
    init_tracing();
    write_artifact(dir, "contracts/Answer.sol/Answer.json", ANSWER_ARTIFACT);
    write_artifact(dir, "contracts/Vault.sol/Vault.json", UNLINKED_ARTIFACT);
    write_artifact(dir, "contracts/MathLib.sol/MathLib.json", MATH_LIB_ARTIFACT);
    write_artifact(dir, "contracts/LinkedBox.sol/LinkedBox.json", LINKED_BOX_ARTIFACT);
    write_artifact(
        dir,
        "@openzeppelin/contracts/proxy/ERC1967/ERC1967Proxy.sol/ERC1967Proxy.json",
        PROXY_ARTIFACT,
    );
    ArtifactStore::new(dir)
}

#[tokio::test]
async fn plain_deploy_refuses_unlinked_bytecode() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(dir.path());
    let node = DevNode::localhost().unwrap();

    let err = deploy_contract(
        &node,
        &store,
        ContractDeployment {
            name: "Vault".to_string(),
            from: TestEOA::dev_account(),
            args: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DevNodeError::MissingLibrary(_)));
}

#[tokio::test]
async fn upgradeable_deploy_refuses_external_libraries_without_override() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(dir.path());
    let node = DevNode::localhost().unwrap();

    let err = deploy_contract_upgradeable(
        &node,
        &store,
        ContractDeployment {
            name: "Vault".to_string(),
            from: TestEOA::dev_account(),
            args: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DevNodeError::ExternalLibraryLinking(name) if name == "Vault"));
}

#[tokio::test]
async fn deploy_of_unknown_contract_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(dir.path());
    let node = DevNode::localhost().unwrap();

    let err = deploy_contract(
        &node,
        &store,
        ContractDeployment {
            name: "Nonexistent".to_string(),
            from: TestEOA::dev_account(),
            args: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DevNodeError::ArtifactNotFound(_)));
}

#[tokio::test]
#[ignore = "requires a running local dev node"]
async fn deploys_contract_with_nonempty_code() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(dir.path());
    let node = DevNode::localhost().unwrap();

    let contract = deploy_contract(
        &node,
        &store,
        ContractDeployment {
            name: "Answer".to_string(),
            from: TestEOA::dev_account(),
            args: vec![],
        },
    )
    .await
    .unwrap();

    devnode_test::assertions::assert_has_code(&node, contract.address()).await;

    let answer: U256 = contract
        .method::<_, U256>("get", ())
        .unwrap()
        .call()
        .await
        .unwrap();
    assert_eq!(answer, U256::from(42u64));
}

// Upgradeable deployment against a real initializable contract needs a
// compiled Hardhat project with the OpenZeppelin ERC1967Proxy artifact;
// point DEVNODE_TEST_ARTIFACTS at its artifacts directory to exercise it.
#[tokio::test]
#[ignore = "requires a running local dev node and DEVNODE_TEST_ARTIFACTS"]
async fn deploys_upgradeable_contract_behind_proxy() {
    let artifacts_dir = std::env::var("DEVNODE_TEST_ARTIFACTS").unwrap();
    let contract_name =
        std::env::var("DEVNODE_TEST_UPGRADEABLE_CONTRACT").unwrap_or_else(|_| "Box".to_string());
    let store = ArtifactStore::new(artifacts_dir);
    let node = DevNode::localhost().unwrap();

    let contract = deploy_contract_upgradeable(
        &node,
        &store,
        ContractDeployment {
            name: contract_name,
            from: TestEOA::dev_account(),
            args: vec![ethers::abi::Token::Uint(U256::from(7u64))],
        },
    )
    .await
    .unwrap();

    devnode_test::assertions::assert_has_code(&node, contract.address()).await;
}

#[tokio::test]
#[ignore = "requires a running local dev node"]
async fn deploys_upgradeable_contract_with_linked_library() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(dir.path());
    let node = DevNode::localhost().unwrap();

    // deploy the library first, then link its address into the implementation
    let library = deploy_contract(
        &node,
        &store,
        ContractDeployment {
            name: "MathLib".to_string(),
            from: TestEOA::dev_account(),
            args: vec![],
        },
    )
    .await
    .unwrap();

    let mut libraries = HashMap::new();
    libraries.insert("MathLib".to_string(), library.address());

    let contract = deploy_contract_upgradeable_with_lib(
        &node,
        &store,
        ContractDeploymentWithLib {
            name: "LinkedBox".to_string(),
            from: TestEOA::dev_account(),
            libraries,
            args: vec![ethers::abi::Token::Uint(U256::from(7u64))],
        },
    )
    .await
    .unwrap();

    devnode_test::assertions::assert_has_code(&node, library.address()).await;
    devnode_test::assertions::assert_has_code(&node, contract.address()).await;
}
