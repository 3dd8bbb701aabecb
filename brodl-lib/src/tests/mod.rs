mod organize_tests;
